use serde_json::Value;

/// Components whose state can be captured and restored as JSON.
pub trait SaveState {
    /// Reads the component's state and returns it as a JSON value.
    fn read_state(&self) -> Value;

    /// Writes the component's state from a JSON value. Malformed input is
    /// logged and leaves the component unchanged.
    fn write_state(&mut self, state: &Value);
}
