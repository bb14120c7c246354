// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path access into serde_json::Value for API payloads, optional or required
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper (to / to_or_default / require)
// invariants: No panics; missing or mistyped paths yield None, defaults, or an error naming the path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;

/// A location inside a JSON document, resolved lazily into a typed value.
pub struct JsonFetched<'a> {
  path: &'a str,
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Deserialize as `T`; `None` when the path is missing, null, or the wrong shape.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Deserialize as `T` or fail with the dotted path in the message.
  pub fn require<T>(&self) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let value = self
      .inner
      .ok_or_else(|| anyhow!("response is missing `{}`", self.path))?;

    serde_json::from_value::<T>(value.clone())
      .map_err(|e| anyhow!("response field `{}` has an unexpected shape: {}", self.path, e))
  }
}

/// Fetch nested values via dotted paths like `base.repo.full_name`.
pub trait JsonFetch {
  fn fetch<'a>(&'a self, path: &'a str) -> JsonFetched<'a>;
}

impl JsonFetch for serde_json::Value {
  fn fetch<'a>(&'a self, path: &'a str) -> JsonFetched<'a> {
    if path.is_empty() {
      return JsonFetched { path, inner: Some(self) };
    }

    let inner = path.split('.').try_fold(self, |cur, key| cur.get(key));

    JsonFetched { path, inner }
  }
}
