use crate::ambient::AmbientSnapshot;
use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::exports::Exports;
use crate::sandbox;
use mlua::{Function, Lua};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use tracing::debug;

/// Loads plain scripts: owns the Lua VM and the ambient snapshot every
/// script is seeded from.
pub struct Loader {
    // dropped before `lua` so no Lua references outlive the VM
    state: Rc<LoaderState>,
    lua: Lua,
}

struct LoaderState {
    config: LoaderConfig,
    snapshot: AmbientSnapshot,
    /// Directories of the files currently being loaded, innermost last.
    dirs: RefCell<Vec<PathBuf>>,
}

/// Lets the Lua-side loader find its way back to the owning `Loader`.
struct StateHandle(Weak<LoaderState>);

impl Loader {
    pub fn new() -> Result<Self, LoadError> {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Result<Self, LoadError> {
        Self::from_lua(Lua::new(), config)
    }

    /// Build a loader on an existing VM. Whatever globals `lua` has right now
    /// become the ambient bindings; later changes are not picked up.
    pub fn from_lua(lua: Lua, config: LoaderConfig) -> Result<Self, LoadError> {
        let script_loader = create_script_loader(&lua)?;
        let snapshot = AmbientSnapshot::capture(&lua, script_loader)?;

        let state = Rc::new(LoaderState {
            config,
            snapshot,
            dirs: RefCell::new(Vec::new()),
        });
        lua.set_app_data(StateHandle(Rc::downgrade(&state)));

        Ok(Self { state, lua })
    }

    /// Load a plain script. Relative locations resolve against the configured
    /// base directory, or the working directory when there is none.
    pub fn load(&self, location: &str) -> Result<Exports, LoadError> {
        let base_dir = self.state.base_dir();
        self.state.load_file(&self.lua, location, &base_dir)
    }

    /// Load a plain script relative to `base_dir`, typically the directory of
    /// the calling file.
    pub fn load_from(&self, location: &str, base_dir: impl AsRef<Path>) -> Result<Exports, LoadError> {
        self.state.load_file(&self.lua, location, base_dir.as_ref())
    }

    /// Run source text that is already in hand. `name` shows up in error
    /// messages and tracebacks.
    pub fn compile(&self, source: &str, name: &str) -> Result<Exports, LoadError> {
        sandbox::compile(&self.lua, &self.state.snapshot, source, name)
    }

    /// Access the underlying Lua VM.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn snapshot(&self) -> &AmbientSnapshot {
        &self.state.snapshot
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.state.config
    }
}

impl LoaderState {
    /// Where a relative location resolves from right now.
    fn base_dir(&self) -> PathBuf {
        self.dirs
            .borrow()
            .last()
            .cloned()
            .or_else(|| self.config.base_dir.clone())
            .unwrap_or_default()
    }

    fn load_file(&self, lua: &Lua, location: &str, base_dir: &Path) -> Result<Exports, LoadError> {
        let path = plainload_source::resolve(location, base_dir, &self.config.extension)?;
        let source = plainload_source::read(&path)?;
        let name = plainload_source::display_name(&path);

        debug!("Loading {} from {}", name, path.display());
        let _scope = DirScope::enter(&self.dirs, &path);
        sandbox::compile(lua, &self.snapshot, &source, &name)
    }
}

/// Keeps the loading file's directory on the stack for nested loads.
struct DirScope<'a> {
    dirs: &'a RefCell<Vec<PathBuf>>,
}

impl<'a> DirScope<'a> {
    fn enter(dirs: &'a RefCell<Vec<PathBuf>>, file: &Path) -> Self {
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        dirs.borrow_mut().push(dir);
        Self { dirs }
    }
}

impl Drop for DirScope<'_> {
    fn drop(&mut self) {
        self.dirs.borrow_mut().pop();
    }
}

/// The function scripts see as `load_script`: runs the whole
/// resolve/read/compile pipeline relative to the loading file and returns the
/// nested script's exports.
fn create_script_loader(lua: &Lua) -> mlua::Result<Function> {
    lua.create_function(|lua, location: String| {
        let state = lua
            .app_data_ref::<StateHandle>()
            .and_then(|handle| handle.0.upgrade())
            .ok_or_else(|| mlua::Error::runtime("Script loader is no longer available"))?;

        let base_dir = state.base_dir();
        let exports = state
            .load_file(lua, &location, &base_dir)
            .map_err(|e| mlua::Error::runtime(e.to_string()))?;
        Ok(exports.into_value())
    })
}
