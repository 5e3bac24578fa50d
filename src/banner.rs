// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 _       _ _
(_)     | | |
 _  ____| | |_  ___
| |/ _  ) |  _)/___)
| ( (/ /| | |_|___ |
|_|\____)_|\___|___/

    IELTS Writing Evaluation Service
"#;
    println!("{}", banner);
}
