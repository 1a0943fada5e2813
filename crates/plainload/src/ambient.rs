use mlua::{Function, Lua, Value};
use tracing::trace;

/// Name the host's module loader is seeded under in every execution environment.
pub const LOADER_NAME: &str = "load";
/// The host's own module loader, kept as an ordinary ambient binding.
pub const REQUIRE_NAME: &str = "require";
/// Synthetic ambient entry that loads another plain script and returns its exports.
pub const SCRIPT_LOADER_NAME: &str = "load_script";

/// The host's global bindings as they were when the loader was created.
///
/// Captured once and never updated; every compile seeds its environment from
/// it and later diffs against it by raw identity.
#[derive(Debug, Clone)]
pub struct AmbientSnapshot {
    loader: Function,
    // sorted by name
    bindings: Vec<(String, Value)>,
}

impl AmbientSnapshot {
    /// Capture the UTF-8 named globals of `lua`, plus `load_script` bound to
    /// `script_loader`.
    ///
    /// The host's `require` becomes the function seeded as `load`; when the
    /// host has none, `script_loader` stands in. The host's own `load` is left
    /// out, since that name belongs to the seeded loader.
    pub fn capture(lua: &Lua, script_loader: Function) -> mlua::Result<Self> {
        let globals = lua.globals();
        let loader = match globals.raw_get::<Value>(REQUIRE_NAME)? {
            Value::Function(require) => require,
            _ => script_loader.clone(),
        };

        let mut bindings = vec![(
            SCRIPT_LOADER_NAME.to_string(),
            Value::Function(script_loader),
        )];
        for pair in globals.pairs::<Value, Value>() {
            let (key, value) = pair?;
            let Value::String(name) = key else {
                continue;
            };
            // a lossy name would seed a different key than the host has
            let Ok(name) = name.to_str() else {
                continue;
            };
            let name = (*name).to_owned();
            if name == LOADER_NAME || name == SCRIPT_LOADER_NAME {
                continue;
            }
            bindings.push((name, value));
        }
        bindings.sort_by(|a, b| a.0.cmp(&b.0));

        trace!("Captured {} ambient bindings", bindings.len());
        Ok(Self { loader, bindings })
    }

    /// The function exposed to scripts as `load`.
    pub fn loader(&self) -> &Function {
        &self.loader
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
impl AmbientSnapshot {
    fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| &self.bindings[i].1)
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }
}
