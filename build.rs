fn main() {
    println!("cargo:rerun-if-env-changed=FIREGUARD_CONFIG");

    // ESP-IDF link arguments are only needed for the firmware image.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
