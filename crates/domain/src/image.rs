/// Decoded camera or snapshot image, RGBA8 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }

    pub fn is_consistent(&self) -> bool {
        self.rgba.len() == self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_checks_buffer_length() {
        let image = DecodedImage {
            width: 2,
            height: 1,
            rgba: vec![0; 8],
        };
        assert!(image.is_consistent());
        assert_eq!(image.size(), [2, 1]);
        assert!(!DecodedImage { rgba: vec![0; 7], ..image }.is_consistent());
    }
}
