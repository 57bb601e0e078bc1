// Stroke colors as the host UI spells them: "#RRGGBB", "#RGB" or "#RRGGBBAA".

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Unpack 0xAARRGGBB.
    #[inline]
    pub fn from_packed(px: u32) -> Self {
        Self {
            a: (px >> 24) as u8,
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    /// Pack as 0xAARRGGBB. A pixel with zero alpha always packs to 0 so
    /// "transparent" has exactly one representation in the buffer.
    #[inline]
    pub fn to_packed(self) -> u32 {
        if self.a == 0 {
            return 0;
        }
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// 0x00RRGGBB, the layout minifb wants.
    #[inline]
    pub fn to_rgb24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let bad = || format!("invalid color '{s}', expected #RGB, #RRGGBB or #RRGGBBAA");

        // from_str_radix takes a leading '+', so vet every digit up front.
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        match hex.len() {
            3 => Ok(Rgba::opaque(
                nibble(0).map_err(|_| bad())?,
                nibble(1).map_err(|_| bad())?,
                nibble(2).map_err(|_| bad())?,
            )),
            6 => Ok(Rgba::opaque(
                byte(0).map_err(|_| bad())?,
                byte(2).map_err(|_| bad())?,
                byte(4).map_err(|_| bad())?,
            )),
            8 => Ok(Rgba {
                r: byte(0).map_err(|_| bad())?,
                g: byte(2).map_err(|_| bad())?,
                b: byte(4).map_err(|_| bad())?,
                a: byte(6).map_err(|_| bad())?,
            }),
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xFF {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_color_forms() {
        assert_eq!("#FF00FF".parse::<Rgba>().unwrap(), Rgba::opaque(255, 0, 255));
        assert_eq!("#ff32f0".parse::<Rgba>().unwrap(), Rgba::opaque(0xFF, 0x32, 0xF0));
        assert_eq!("#f0a".parse::<Rgba>().unwrap(), Rgba::opaque(0xFF, 0x00, 0xAA));
        assert_eq!(
            "#11223380".parse::<Rgba>().unwrap(),
            Rgba { r: 0x11, g: 0x22, b: 0x33, a: 0x80 }
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("magenta".parse::<Rgba>().is_err());
        assert!("#12".parse::<Rgba>().is_err());
        assert!("#GGGGGG".parse::<Rgba>().is_err());
        assert!("#ééé".parse::<Rgba>().is_err());
    }

    #[test]
    fn rejects_sign_characters_between_digits() {
        assert!("#+F+F+F".parse::<Rgba>().is_err());
        assert!("#+1+2+3".parse::<Rgba>().is_err());
        assert!("#+F0".parse::<Rgba>().is_err());
        assert!("#-1-2-3".parse::<Rgba>().is_err());
    }

    #[test]
    fn transparent_packs_to_zero() {
        let c = Rgba { r: 9, g: 9, b: 9, a: 0 };
        assert_eq!(c.to_packed(), 0);
        assert_eq!(Rgba::from_packed(0xFF_FF_00_FF), Rgba::opaque(255, 0, 255));
        assert_eq!(Rgba::opaque(255, 0, 255).to_string(), "#FF00FF");
    }
}
