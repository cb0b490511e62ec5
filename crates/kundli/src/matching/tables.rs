//! Classical reference tables for Ashta-Koota matching.

use serde::Serialize;

use crate::astro::position::{Nakshatra, Sign};

/// The seven classical grahas that rule signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Planet {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
}

pub const fn rashi_lord(sign: Sign) -> Planet {
    match sign {
        Sign::Aries | Sign::Scorpio => Planet::Mars,
        Sign::Taurus | Sign::Libra => Planet::Venus,
        Sign::Gemini | Sign::Virgo => Planet::Mercury,
        Sign::Cancer => Planet::Moon,
        Sign::Leo => Planet::Sun,
        Sign::Sagittarius | Sign::Pisces => Planet::Jupiter,
        Sign::Capricorn | Sign::Aquarius => Planet::Saturn,
    }
}

/// Naisargika (natural) disposition of one planet towards another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relationship {
    Friend,
    Neutral,
    Enemy,
}

const fn friends(planet: Planet) -> &'static [Planet] {
    use Planet::*;
    match planet {
        Sun => &[Moon, Mars, Jupiter],
        Moon => &[Sun, Mercury],
        Mars => &[Sun, Moon, Jupiter],
        Mercury => &[Sun, Venus],
        Jupiter => &[Sun, Moon, Mars],
        Venus => &[Mercury, Saturn],
        Saturn => &[Mercury, Venus],
    }
}

const fn neutrals(planet: Planet) -> &'static [Planet] {
    use Planet::*;
    match planet {
        Sun => &[Mercury],
        Moon => &[Mars, Jupiter, Venus, Saturn],
        Mars => &[Venus, Saturn],
        Mercury => &[Mars, Jupiter, Saturn],
        Jupiter => &[Saturn],
        Venus => &[Mars, Jupiter],
        Saturn => &[Jupiter],
    }
}

/// How `from` regards `to`. Not symmetric: the Sun is neutral to Mercury
/// while Mercury counts the Sun a friend.
pub fn natural_relationship(from: Planet, to: Planet) -> Relationship {
    if friends(from).contains(&to) {
        Relationship::Friend
    } else if neutrals(from).contains(&to) {
        Relationship::Neutral
    } else {
        Relationship::Enemy
    }
}

/// Caste ranking of a sign, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Varna {
    Shudra,
    Vaishya,
    Kshatriya,
    Brahmin,
}

pub const fn varna(sign: Sign) -> Varna {
    match sign {
        Sign::Aries | Sign::Leo | Sign::Sagittarius => Varna::Kshatriya,
        Sign::Taurus | Sign::Virgo | Sign::Capricorn => Varna::Vaishya,
        Sign::Gemini | Sign::Libra | Sign::Aquarius => Varna::Shudra,
        Sign::Cancer | Sign::Scorpio | Sign::Pisces => Varna::Brahmin,
    }
}

/// Signs under the control (vashya) of `sign`.
pub const fn vashya_controls(sign: Sign) -> &'static [Sign] {
    use Sign::*;
    match sign {
        Aries => &[Leo, Scorpio],
        Taurus => &[Cancer, Libra],
        Gemini => &[Virgo],
        Cancer => &[Scorpio, Pisces],
        Leo => &[Libra],
        Virgo => &[Pisces, Gemini],
        Libra => &[Virgo, Capricorn],
        Scorpio => &[Cancer],
        Sagittarius => &[Pisces],
        Capricorn => &[Aries, Aquarius],
        Aquarius => &[Aries],
        Pisces => &[Capricorn],
    }
}

/// Temperament of a nakshatra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gana {
    Deva,
    Manushya,
    Rakshasa,
}

pub const fn gana(nakshatra: Nakshatra) -> Gana {
    use Nakshatra::*;
    match nakshatra {
        Ashwini | Mrigashira | Punarvasu | Pushya | Hasta | Swati | Anuradha | Shravana | Revati => {
            Gana::Deva
        }
        Bharani | Rohini | Ardra | PurvaPhalguni | UttaraPhalguni | PurvaAshadha
        | UttaraAshadha | PurvaBhadrapada | UttaraBhadrapada => Gana::Manushya,
        Krittika | Ashlesha | Magha | Chitra | Vishakha | Jyeshtha | Mula | Dhanishta
        | Shatabhisha => Gana::Rakshasa,
    }
}

/// Animal symbol of a nakshatra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Yoni {
    Horse,
    Elephant,
    Sheep,
    Serpent,
    Dog,
    Cat,
    Rat,
    Cow,
    Buffalo,
    Tiger,
    Deer,
    Monkey,
    Mongoose,
    Lion,
}

pub const fn yoni(nakshatra: Nakshatra) -> Yoni {
    use Nakshatra::*;
    match nakshatra {
        Ashwini | Shatabhisha => Yoni::Horse,
        Bharani | Revati => Yoni::Elephant,
        Krittika | Pushya => Yoni::Sheep,
        Rohini => Yoni::Serpent,
        Mrigashira | Anuradha | Jyeshtha => Yoni::Deer,
        Ardra | Mula => Yoni::Dog,
        Punarvasu | Ashlesha => Yoni::Cat,
        Magha | PurvaPhalguni => Yoni::Rat,
        UttaraPhalguni | UttaraBhadrapada => Yoni::Cow,
        Hasta | Swati => Yoni::Buffalo,
        Chitra | Vishakha => Yoni::Tiger,
        PurvaAshadha | Shravana => Yoni::Monkey,
        UttaraAshadha => Yoni::Mongoose,
        Dhanishta | PurvaBhadrapada => Yoni::Lion,
    }
}

/// Unordered pairs of mutually hostile yonis.
const YONI_ENEMIES: [(Yoni, Yoni); 8] = [
    (Yoni::Rat, Yoni::Cat),
    (Yoni::Lion, Yoni::Elephant),
    (Yoni::Dog, Yoni::Deer),
    (Yoni::Monkey, Yoni::Sheep),
    (Yoni::Mongoose, Yoni::Serpent),
    (Yoni::Cow, Yoni::Tiger),
    (Yoni::Horse, Yoni::Buffalo),
    (Yoni::Rat, Yoni::Lion),
];

pub fn yonis_are_enemies(a: Yoni, b: Yoni) -> bool {
    YONI_ENEMIES
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// Pulse category of a nakshatra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nadi {
    Adi,
    Madhya,
    Antya,
}

pub const fn nadi(nakshatra: Nakshatra) -> Nadi {
    use Nakshatra::*;
    match nakshatra {
        Ashwini | Rohini | Punarvasu | PurvaPhalguni | Chitra | Anuradha | PurvaAshadha
        | Dhanishta | PurvaBhadrapada => Nadi::Adi,
        Bharani | Mrigashira | Pushya | UttaraPhalguni | Swati | Jyeshtha | UttaraAshadha
        | Shatabhisha | UttaraBhadrapada => Nadi::Madhya,
        Krittika | Ardra | Ashlesha | Magha | Hasta | Vishakha | Mula | Shravana | Revati => {
            Nadi::Antya
        }
    }
}
