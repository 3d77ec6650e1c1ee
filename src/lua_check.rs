use rlua::Lua;

/// Compiles `source` as a Lua chunk without running it. Lua source is 8-bit clean,
/// so the bytes are passed through as-is.
pub fn check_syntax(source: &[u8]) -> Result<(), rlua::Error> {
    let lua = Lua::new();
    lua.context(|lua_ctx| lua_ctx.load(source).into_function().map(|_| ()))
}
