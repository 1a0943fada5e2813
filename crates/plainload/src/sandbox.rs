use crate::ambient::{AmbientSnapshot, LOADER_NAME};
use crate::error::LoadError;
use crate::exports::Exports;
use mlua::{Lua, Table, Value};
use tracing::{debug, trace};

/// Execute `source` against a fresh environment seeded from `ambient` and
/// harvest the globals it introduced.
///
/// The chunk's environment is a new table, so top-level assignments never
/// reach the host's global table. After the chunk runs, every seeded binding
/// that is still raw-equal to its seed is dropped; whatever is left is the
/// script's export. Assigning an ambient name the same value it already had
/// is indistinguishable from not touching it.
pub fn compile(
    lua: &Lua,
    ambient: &AmbientSnapshot,
    source: &str,
    name: &str,
) -> Result<Exports, LoadError> {
    let env = seed_environment(lua, ambient)?;

    let chunk = lua
        .load(source)
        .set_name(format!("@{}", name))
        .set_environment(env.clone())
        .into_function()
        .map_err(|e| match e {
            mlua::Error::SyntaxError { message, .. } => LoadError::Compile {
                name: name.to_string(),
                message,
            },
            other => LoadError::Lua(other),
        })?;

    debug!("Executing {}", name);
    chunk.call::<()>(()).map_err(|e| LoadError::Runtime {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    drop_untouched(&env, ambient)?;
    extract(lua, &env)
}

fn seed_environment(lua: &Lua, ambient: &AmbientSnapshot) -> mlua::Result<Table> {
    let env = lua.create_table()?;
    env.raw_set(LOADER_NAME, ambient.loader().clone())?;
    for (binding, value) in ambient.iter() {
        if env.raw_get::<Value>(binding)?.is_nil() {
            env.raw_set(binding, value.clone())?;
        }
    }
    Ok(env)
}

/// Remove the loader and every ambient binding whose identity survived.
fn drop_untouched(env: &Table, ambient: &AmbientSnapshot) -> mlua::Result<()> {
    let loader = Value::Function(ambient.loader().clone());
    if env.raw_get::<Value>(LOADER_NAME)? == loader {
        env.raw_set(LOADER_NAME, Value::Nil)?;
    }

    // Value equality is lua_rawequal: identity for reference types
    for (binding, seeded) in ambient.iter() {
        if env.raw_get::<Value>(binding)? == *seeded {
            env.raw_set(binding, Value::Nil)?;
        }
    }
    Ok(())
}

fn extract(lua: &Lua, env: &Table) -> Result<Exports, LoadError> {
    let mut remaining = Vec::new();
    for pair in env.pairs::<Value, Value>() {
        remaining.push(pair?);
    }
    trace!("{} binding(s) left after cleanup", remaining.len());

    if let [(_, value)] = remaining.as_slice() {
        return Ok(Exports::Single(value.clone()));
    }

    let exports = lua.create_table()?;
    for (key, value) in remaining {
        exports.raw_set(key, value)?;
    }
    Ok(Exports::Bindings(exports))
}
