#![no_main]

use libfuzzer_sys::fuzz_target;
use jnisig::MethodCatalog;

fuzz_target!(|data: &[u8]| {
    if let Ok(catalog) = MethodCatalog::from_reader(data) {
        for method in &catalog {
            let _ = method.symbol_name();
        }
    }
});
