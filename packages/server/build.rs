fn main() {
    // Re-embed migrations when a new one is added
    println!("cargo:rerun-if-changed=migrations");
}
