//! Hash an operator password for `BRISA_ADMIN_PASSWORD_HASH`.
//!
//! Reads the password from stdin so it never appears in shell history:
//!
//! ```bash
//! echo -n 'my password' | brisa hash-password
//! ```

use std::io::Read;

/// Read a password from stdin and print its bcrypt hash.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or hashing fails.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut password = String::new();
    std::io::stdin().read_to_string(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);

    if password.is_empty() {
        return Err("empty password".into());
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }

    Ok(())
}
