pub mod handlers;
pub mod responses;
#[cfg(test)]
mod tests;
