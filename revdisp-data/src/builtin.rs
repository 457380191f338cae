//! Parameter tables compiled into the binary.
//!
//! | File              | Tables          |
//! |-------------------|-----------------|
//! | `tables/2023.csv` | QC 2023, CA 2023 |
//! | `tables/2024.csv` | QC 2024, CA 2024 |

use revdisp_core::{MemorySource, ParameterStore};

use crate::loader::{ParameterTableLoader, TableLoaderError};

pub const TABLES: &[(&str, &str)] = &[
    ("2023.csv", include_str!("../tables/2023.csv")),
    ("2024.csv", include_str!("../tables/2024.csv")),
];

/// A source holding every built-in table.
pub fn builtin_source() -> Result<MemorySource, TableLoaderError> {
    let mut source = MemorySource::new();
    for (_, contents) in TABLES {
        source.extend(ParameterTableLoader::source(contents.as_bytes())?)?;
    }
    Ok(source)
}

/// A parameter store over the built-in tables.
pub fn builtin_store() -> Result<ParameterStore, TableLoaderError> {
    Ok(ParameterStore::new(builtin_source()?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_tables_cover_both_years() {
        let store = builtin_store().unwrap();

        assert_eq!(store.supported_years(), vec![2023, 2024]);
        assert_eq!(store.preload(), Ok(4));
    }
}
