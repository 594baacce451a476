/// Keyboard commands polled between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Reset,
    None,
}

impl KeyCommand {
    /// Map a raw key code (as returned by the window's key poll, -1 for none)
    pub fn from_key(key: i32) -> Self {
        match key & 0xFF {
            k if k == 'q' as i32 || k == 27 => KeyCommand::Quit,
            k if k == 'r' as i32 => KeyCommand::Reset,
            _ => KeyCommand::None,
        }
    }
}
