pub mod products;
pub mod users;

/// User-facing message for one invalid field.
pub fn field_message(name: &str, message: &str) -> String {
    format!("El campo {name} {message}")
}
