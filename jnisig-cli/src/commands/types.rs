use std::path::Path;

use comfy_table::CellAlignment;
use jnisig::TypeManager;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_archive,
    output::{print_output, print_table},
};

#[derive(Debug, Serialize)]
struct TypeEntry {
    path: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
}

#[derive(Debug, Serialize)]
struct TypesOutput {
    archive: String,
    id: String,
    types: Vec<TypeEntry>,
}

pub fn run(archive: Option<&Path>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut manager = TypeManager::new();
    let archive = load_archive(&mut manager, archive)?;

    let output = TypesOutput {
        archive: archive.name().to_string(),
        id: archive.id().to_string(),
        types: archive
            .iter()
            .map(|dt| TypeEntry {
                path: dt.path(),
                kind: dt.kind.to_string(),
                size: dt.size,
            })
            .collect(),
    };

    print_output(&output, opts, |out| {
        println!("{} ({}): {} types", out.archive, out.id, out.types.len());
        print_table(
            &[
                ("Path", CellAlignment::Left),
                ("Kind", CellAlignment::Left),
                ("Size", CellAlignment::Right),
            ],
            out.types.iter().map(|t| {
                let size = match (t.size, t.kind.as_str()) {
                    (Some(size), _) => size.to_string(),
                    (None, "pointer") => "ptr".to_string(),
                    (None, _) => "-".to_string(),
                };
                vec![t.path.clone(), t.kind.clone(), size]
            }),
        );
    })
}
