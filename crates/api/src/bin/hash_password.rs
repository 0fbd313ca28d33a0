//! Operator utility: produce an Argon2id PHC hash for a password.
//!
//! Used when seeding the admin account:
//!
//! ```text
//! cargo run --bin hash-password -- 's3cure-admin-pass'
//! ```
//!
//! then insert the printed hash into `customers.password_hash` with
//! `role = 'admin'`.

use bureau_api::auth::password::hash_password;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(password) = args.next() else {
        eprintln!("usage: hash-password <password>");
        std::process::exit(2);
    };

    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("hashing failed: {e}");
            std::process::exit(1);
        }
    }
}
