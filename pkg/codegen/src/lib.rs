//! Preamble for generated Go source files that build RBAC objects.

use std::io::{self, Write};
use tracing::debug;

/// Import line every generated file carries.
pub const RBAC_IMPORT: &str = "import rbacv1 \"k8s.io/api/rbac/v1\"";

/// Write the three-line preamble: package clause, blank line, RBAC import.
pub fn write_preamble(package: &str, out: &mut impl Write) -> io::Result<()> {
    if !is_identifier(package) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a valid package name", package),
        ));
    }
    debug!("Writing preamble for package {}", package);
    write_line(out, &format!("package {}", package))?;
    write_line(out, "")?;
    write_line(out, RBAC_IMPORT)
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(out, "{}", line)
}

/// Letters, digits and underscores, not starting with a digit.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
