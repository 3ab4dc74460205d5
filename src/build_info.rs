/// Print a JSON object naming the binary, the build and any extra fields.
/// Values are written as JSON strings.
pub fn print_report(name: &str, fields: &[(&str, String)]) {
    println!("{{");
    println!("  \"name\": \"{}\",", name);
    println!("  \"git_describe\": \"{}\",", env!("GIT_DESCRIBE"));
    print!("  \"git_hash\": \"{}\"", env!("GIT_HASH"));
    for (key, value) in fields {
        print!(",\n  \"{}\": \"{}\"", key, value);
    }
    println!();
    println!("}}");
}
