use mlua::{FromLua, Lua, LuaSerdeExt, Table, Value};
use serde::de::DeserializeOwned;

/// What a plain script left behind.
///
/// A single surviving global is handed back as-is. Anything else (including
/// nothing) comes back as a fresh table keyed by global name.
#[derive(Debug, Clone)]
pub enum Exports {
    Single(Value),
    Bindings(Table),
}

impl Exports {
    /// Flatten into the Lua value a script sees from `load(...)`.
    pub fn into_value(self) -> Value {
        match self {
            Exports::Single(value) => value,
            Exports::Bindings(table) => Value::Table(table),
        }
    }

    /// Convert into any type Lua values convert to.
    pub fn into_typed<V: FromLua>(self, lua: &Lua) -> mlua::Result<V> {
        V::from_lua(self.into_value(), lua)
    }

    /// Convert into a Rust type through serde.
    pub fn deserialize<T: DeserializeOwned>(&self, lua: &Lua) -> mlua::Result<T> {
        lua.from_value(self.clone().into_value())
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Exports::Single(value) => Some(value),
            Exports::Bindings(_) => None,
        }
    }

    pub fn bindings(&self) -> Option<&Table> {
        match self {
            Exports::Single(_) => None,
            Exports::Bindings(table) => Some(table),
        }
    }

    /// Look up a named binding. Always nil for a single export.
    pub fn get(&self, name: &str) -> mlua::Result<Value> {
        match self {
            Exports::Bindings(table) => table.raw_get(name),
            Exports::Single(_) => Ok(Value::Nil),
        }
    }

    /// Number of exported bindings.
    pub fn len(&self) -> usize {
        match self {
            Exports::Single(_) => 1,
            Exports::Bindings(table) => table.pairs::<Value, Value>().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
