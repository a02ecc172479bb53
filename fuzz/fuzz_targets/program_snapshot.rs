#![no_main]

use libfuzzer_sys::fuzz_target;
use jnisig::{types::bundled, MethodCatalog, ProgramDatabase, SignatureApplier};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut program) = ProgramDatabase::from_str(text) else {
        return;
    };
    let archive = bundled::jni_all().unwrap();
    let _ = SignatureApplier::new(&archive).run(&mut program, &MethodCatalog::default());
});
