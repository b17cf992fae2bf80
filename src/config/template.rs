use std::io;
use std::path::Path;

use log::info;

/// The annotated template shipped with the tool. Doubles as the reference
/// documentation for every key and its default.
pub const CONFIG_TEMPLATE: &str = include_str!("../../config.ini.example");

/// Writes the template for the user to fill in. Refuses to clobber an
/// existing file.
pub fn write_template(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        ));
    }
    std::fs::write(path, CONFIG_TEMPLATE)?;
    info!("wrote {}", path.display());
    Ok(())
}
