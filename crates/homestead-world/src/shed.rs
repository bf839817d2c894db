//! Drop position for loot shed by a plant or animal.
//!
//! Season-end shedding and death drops both place their ground resources at
//! the bottom-right corner of the tile the source occupies, inset by
//! [`SHED_INSET`] pixels on each axis. The tile size comes from the world
//! configuration so this stays independent of rendering settings.

/// Pixels between the tile's bottom-right corner and the drop point.
pub const SHED_INSET: i32 = 8;

/// Compute the drop point for loot from a source at pixel `(source_x, source_y)`.
///
/// Negative coordinates use floor division so a source at `-1` falls in
/// tile `-1`, not tile `0`. A zero tile size, or a tile size that does not
/// fit the coordinate range, leaves the source position unchanged.
pub fn shed_position(source_x: i32, source_y: i32, tile_size: u32) -> (i32, i32) {
    let Ok(tile) = i32::try_from(tile_size) else {
        return (source_x, source_y);
    };
    match (shed_axis(source_x, tile), shed_axis(source_y, tile)) {
        (Some(x), Some(y)) => (x, y),
        _ => (source_x, source_y),
    }
}

fn shed_axis(coord: i32, tile: i32) -> Option<i32> {
    if tile <= 0 {
        return None;
    }
    let tile_index = coord.checked_div_euclid(tile)?;
    tile_index
        .checked_add(1)?
        .checked_mul(tile)?
        .checked_sub(SHED_INSET)
}
