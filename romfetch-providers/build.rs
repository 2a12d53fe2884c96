use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const KEY: &[u8] = b"romfetch-ss-devinfo-5e21d9";

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("embedded_dev_info.rs");

    let mut code = String::new();
    writeln!(code, "const DEV_INFO_KEY: &[u8] = &{:?};", KEY).unwrap();

    // Both halves or nothing.
    match (
        env::var("SCREENSCRAPER_DEVID").ok(),
        env::var("SCREENSCRAPER_DEVPASSWORD").ok(),
    ) {
        (Some(id), Some(password)) => {
            writeln!(
                code,
                "const EMBEDDED_DEV_ID: Option<&[u8]> = Some(&{:?});",
                xor(id.as_bytes()).as_slice()
            )
            .unwrap();
            writeln!(
                code,
                "const EMBEDDED_DEV_PASSWORD: Option<&[u8]> = Some(&{:?});",
                xor(password.as_bytes()).as_slice()
            )
            .unwrap();
        }
        _ => {
            code.push_str("const EMBEDDED_DEV_ID: Option<&[u8]> = None;\n");
            code.push_str("const EMBEDDED_DEV_PASSWORD: Option<&[u8]> = None;\n");
        }
    }

    fs::write(&dest, code).unwrap();

    println!("cargo:rerun-if-env-changed=SCREENSCRAPER_DEVID");
    println!("cargo:rerun-if-env-changed=SCREENSCRAPER_DEVPASSWORD");
}

fn xor(data: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ KEY[i % KEY.len()])
        .collect()
}
