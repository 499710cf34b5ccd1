//! Геометрия гексагональной сетки со смещёнными столбцами ("odd-q").
//!
//! Нечётные столбцы сдвинуты на полклетки вниз, поэтому набор соседей зависит
//! от чётности `x`.

const EVEN_COLUMN: [(i32, i32); 6] = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)];
const ODD_COLUMN: [(i32, i32); 6] = [(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

/// Смещения шести соседей клетки в столбце `x`.
#[must_use]
pub fn neighbor_offsets(x: i32) -> &'static [(i32, i32); 6] {
    if x.rem_euclid(2) == 0 {
        &EVEN_COLUMN
    } else {
        &ODD_COLUMN
    }
}

/// Соседи клетки `(x, y)`, лежащие внутри карты `width × height`.
pub fn neighbors(x: i32, y: i32, width: i32, height: i32) -> impl Iterator<Item = (i32, i32)> {
    neighbor_offsets(x)
        .iter()
        .map(move |&(dx, dy)| (x + dx, y + dy))
        .filter(move |&(nx, ny)| nx >= 0 && ny >= 0 && nx < width && ny < height)
}
