//! Build script for Dewey.
//!
//! Copies the credentials template into the user's local data directory so
//! it sits next to the token cache after installation:
//! - Linux: `~/.local/share/dewey/dewey.example.toml`
//! - macOS: `~/Library/Application Support/dewey/dewey.example.toml`
//! - Windows: `%LOCALAPPDATA%/dewey/dewey.example.toml`
//!
//! A missing template only produces a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=dewey.example.toml");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template_path = manifest_dir.join("dewey.example.toml");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("dewey");
    fs::create_dir_all(&out_dir)?;

    if template_path.is_file() {
        let contents = fs::read_to_string(&template_path)?;
        fs::write(out_dir.join("dewey.example.toml"), contents)?;
    } else {
        println!(
            "cargo:warning=dewey.example.toml not found at {}",
            template_path.display()
        );
    }

    Ok(())
}
