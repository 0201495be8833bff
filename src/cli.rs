mod check;
mod refresh;
mod settings;

pub use check::CheckArgs;
pub use refresh::RefreshArgs;
