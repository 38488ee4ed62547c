mod interaction;
mod view;

/// Side of the square in a tooltip's corner that closes it.
const CLOSE_BOX: f64 = 8.0;
