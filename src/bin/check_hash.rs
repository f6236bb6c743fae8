//! Command-line helper for checking and minting bcrypt hashes by hand.
//!
//! ```text
//! check-hash verify --hash '$2b$12$...' 'guess'
//! echo 'guess' | check-hash verify --hash '$2b$12$...'
//! check-hash hash --cost 12 'new password'
//! ```

use std::{
    io::{self, BufRead},
    process::ExitCode,
};

use auth_service::{
    domain::{models::hash_record::Cost, services::password_service::PasswordHasher},
    infrastructure::bcrypt_password_hasher::{self, BcryptPasswordHasher},
};
use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

#[derive(Debug, Parser)]
#[command(name = "check-hash", about = "Check passwords against bcrypt hashes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print `true` if the password matches the hash, `false` otherwise
    Verify {
        /// Stored hash, e.g. `$2b$12$...`
        #[arg(long)]
        hash: String,
        /// Password to try; read from stdin when omitted
        password: Option<String>,
    },
    /// Print a freshly salted hash of the password
    Hash {
        #[arg(long, default_value = "10", value_parser = parse_cost)]
        cost: Cost,
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },
}

fn parse_cost(value: &str) -> Result<Cost, String> {
    let cost: u32 = value.parse().map_err(|_| format!("{value:?} is not a number"))?;
    Cost::new(cost).map_err(|e| e.to_string())
}

/// Take the password from the command line, or the first line of `input`
fn password_from(arg: Option<String>, input: impl BufRead) -> io::Result<Zeroizing<String>> {
    if let Some(password) = arg {
        return Ok(Zeroizing::new(password));
    }
    let mut line = Zeroizing::new(String::new());
    input.take(4096).read_line(&mut line)?;
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(line)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify { hash, password } => {
            let password = match password_from(password, io::stdin().lock()) {
                Ok(password) => password,
                Err(e) => {
                    eprintln!("error: cannot read password: {e}");
                    return ExitCode::from(2);
                }
            };
            match bcrypt_password_hasher::verify(password.as_bytes(), &hash) {
                Ok(true) => {
                    println!("true");
                    ExitCode::SUCCESS
                }
                Ok(false) => {
                    println!("false");
                    ExitCode::from(1)
                }
                Err(e) => {
                    eprintln!("error: malformed hash: {e}");
                    ExitCode::from(2)
                }
            }
        }
        Command::Hash { cost, password } => {
            let password = match password_from(password, io::stdin().lock()) {
                Ok(password) => password,
                Err(e) => {
                    eprintln!("error: cannot read password: {e}");
                    return ExitCode::from(2);
                }
            };
            match BcryptPasswordHasher::new(cost).hash(password.as_bytes()) {
                Ok(hashed) => {
                    println!("{}", hashed.as_str());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::from(2)
                }
            }
        }
    }
}
