fn main() {
    // Emits the ESP-IDF link/cfg directives when building for espidf;
    // a no-op on host targets where the sysenv variables are absent.
    embuild::espidf::sysenv::output();
}
