use image::Rgb;

/// Exact colors the board renderer paints with. Matching is by equality, no tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Glyph colors for counts 1, 2, 3, ... in that order.
    pub numbers: Vec<Rgb<u8>>,
    /// Flag glyph, also used for a triggered mine.
    pub mine_marker: Rgb<u8>,
    /// Background of an opened cell, sampled near its top-left corner.
    pub empty: Vec<Rgb<u8>>,
    /// Background of an unopened cell.
    pub unopened: Vec<Rgb<u8>>,
}

impl Palette {
    /// Count for a number glyph color.
    pub fn number_for(&self, pixel: &Rgb<u8>) -> Option<u8> {
        self.numbers
            .iter()
            .position(|c| c == pixel)
            .map(|i| (i + 1) as u8)
    }

    pub fn is_mine_marker(&self, pixel: &Rgb<u8>) -> bool {
        self.mine_marker == *pixel
    }

    pub fn is_empty(&self, pixel: &Rgb<u8>) -> bool {
        self.empty.contains(pixel)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            numbers: vec![
                Rgb([25, 118, 210]),
                Rgb([56, 142, 60]),
                Rgb([211, 47, 47]),
                Rgb([123, 31, 162]),
                Rgb([255, 143, 0]),
                Rgb([0, 151, 167]),
            ],
            mine_marker: Rgb([242, 54, 7]),
            empty: vec![Rgb([225, 202, 179]), Rgb([215, 184, 153]), Rgb([229, 194, 159])],
            unopened: vec![Rgb([162, 209, 73]), Rgb([170, 215, 81]), Rgb([185, 221, 119])],
        }
    }
}

#[cfg(test)]
mod palette_tests {
    use super::*;

    #[test]
    fn numbers_are_one_based() {
        let palette = Palette::default();
        assert_eq!(palette.number_for(&Rgb([25, 118, 210])), Some(1));
        assert_eq!(palette.number_for(&Rgb([0, 151, 167])), Some(6));
        assert_eq!(palette.number_for(&Rgb([25, 118, 211])), None);
    }

    #[test]
    fn categories_do_not_overlap() {
        let palette = Palette::default();
        for color in palette.numbers.iter().chain(&palette.unopened) {
            assert!(!palette.is_empty(color));
            assert!(!palette.is_mine_marker(color));
        }
        for color in &palette.unopened {
            assert_eq!(palette.number_for(color), None);
        }
    }
}
