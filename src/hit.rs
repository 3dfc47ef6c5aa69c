/// Whether `position` lies inside the sweet spot centered on the bar.
///
/// Half-width uses integer division and the comparison is strict, so a cursor
/// sitting exactly on the edge misses.
pub fn is_hit(position: i32, sweet_spot_width: u32) -> bool {
    position.unsigned_abs() < sweet_spot_width / 2
}
