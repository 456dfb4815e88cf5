// Pass-through query execution: LIMIT enforcement, dynamic row decoding,
// and the /query handler. Statements run exactly as submitted apart from
// the LIMIT appended to bare SELECTs.

pub mod handlers;
pub mod limit;
pub mod rows;
