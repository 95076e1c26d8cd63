/// Fixed five-color palette shared by isochrone areas and route lines.
///
/// Color is selected by a contribution's current insertion index, not by
/// its id, so after removals the remaining contributions keep cycling
/// predictably by position.
pub const PALETTE: [[f32; 4]; 5] = [
    [0.13, 0.47, 0.81, 1.0], // blue
    [0.89, 0.47, 0.11, 1.0], // orange
    [0.17, 0.63, 0.29, 1.0], // green
    [0.55, 0.27, 0.68, 1.0], // purple
    [0.84, 0.15, 0.16, 1.0], // red
];

pub fn color_for_index(index: usize) -> [f32; 4] {
    PALETTE[index % PALETTE.len()]
}
