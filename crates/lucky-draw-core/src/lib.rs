// Library root: the raffle core shared by the terminal front end and tests.
//
// Leaf-first: `roster` parses names, `draw` picks winners, `history` holds
// completed rounds, `session` ties them into the draw lifecycle, and `export`
// turns history into a CSV file.

pub mod config;
pub mod draw;
pub mod export;
pub mod history;
pub mod roster;
pub mod session;
