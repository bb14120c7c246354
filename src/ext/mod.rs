// Extension traits for third-party crates, grouped under `crate::ext`.

pub mod serde_json;
