//! Characters standing in the car or on the crossing.
//!
//! A [`Character`] is a shared attribute record (age, gender, body type) plus
//! a [`CharacterKind`] carrying the person- or animal-specific fields. The
//! person invariants (profession only for adults, pregnancy only for females)
//! are re-applied by every constructor, every `with_*` update and serde
//! decoding, so no field write can bypass them.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    AGE_IMPORTANCE_ADULT, AGE_IMPORTANCE_BABY, AGE_IMPORTANCE_CHILD, AGE_IMPORTANCE_SENIOR,
    MIN_ADULT_AGE, MIN_CHILD_AGE, MIN_SENIOR_AGE, PET_IMPORTANCE, PREGNANT_IMPORTANCE,
    PROFESSION_IMPORTANCE_CEO, PROFESSION_IMPORTANCE_CRIMINAL, PROFESSION_IMPORTANCE_DOCTOR,
    PROFESSION_IMPORTANCE_HOMELESS, PROFESSION_IMPORTANCE_POLICE, PROFESSION_IMPORTANCE_PRESIDENT,
    YOU_IMPORTANCE,
};

pub const DEFAULT_SPECIES: &str = "dog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unknown" => Ok(Self::Unknown),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Average,
    Athletic,
    Overweight,
    #[default]
    Unspecified,
}

impl BodyType {
    pub const ALL: [Self; 4] = [
        Self::Average,
        Self::Athletic,
        Self::Overweight,
        Self::Unspecified,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Athletic => "athletic",
            Self::Overweight => "overweight",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(Self::Average),
            "athletic" => Ok(Self::Athletic),
            "overweight" => Ok(Self::Overweight),
            "unspecified" => Ok(Self::Unspecified),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profession {
    Doctor,
    Ceo,
    Criminal,
    President,
    Police,
    Homeless,
    Unemployed,
    Unknown,
    #[default]
    None,
}

impl Profession {
    /// Professions an adult can be assigned by the scenario generator.
    pub const WORKING: [Self; 7] = [
        Self::Doctor,
        Self::Ceo,
        Self::Criminal,
        Self::President,
        Self::Police,
        Self::Homeless,
        Self::Unemployed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Ceo => "ceo",
            Self::Criminal => "criminal",
            Self::President => "president",
            Self::Police => "police",
            Self::Homeless => "homeless",
            Self::Unemployed => "unemployed",
            Self::Unknown => "unknown",
            Self::None => "none",
        }
    }

    #[must_use]
    pub const fn importance(self) -> i32 {
        match self {
            Self::President => PROFESSION_IMPORTANCE_PRESIDENT,
            Self::Police => PROFESSION_IMPORTANCE_POLICE,
            Self::Doctor => PROFESSION_IMPORTANCE_DOCTOR,
            Self::Ceo => PROFESSION_IMPORTANCE_CEO,
            Self::Homeless => PROFESSION_IMPORTANCE_HOMELESS,
            Self::Criminal => PROFESSION_IMPORTANCE_CRIMINAL,
            Self::Unemployed | Self::Unknown | Self::None => 0,
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profession {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(Self::Doctor),
            "ceo" => Ok(Self::Ceo),
            "criminal" => Ok(Self::Criminal),
            "president" => Ok(Self::President),
            "police" => Ok(Self::Police),
            "homeless" => Ok(Self::Homeless),
            "unemployed" => Ok(Self::Unemployed),
            "unknown" => Ok(Self::Unknown),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeCategory {
    Baby,
    Child,
    Adult,
    Senior,
}

impl AgeCategory {
    /// Derive the age band; each band includes its lower bound.
    #[must_use]
    pub const fn from_age(age: u32) -> Self {
        if age >= MIN_SENIOR_AGE {
            Self::Senior
        } else if age >= MIN_ADULT_AGE {
            Self::Adult
        } else if age >= MIN_CHILD_AGE {
            Self::Child
        } else {
            Self::Baby
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baby => "baby",
            Self::Child => "child",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }

    #[must_use]
    pub const fn importance(self) -> i32 {
        match self {
            Self::Senior => AGE_IMPORTANCE_SENIOR,
            Self::Adult => AGE_IMPORTANCE_ADULT,
            Self::Child => AGE_IMPORTANCE_CHILD,
            Self::Baby => AGE_IMPORTANCE_BABY,
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant tag used for tallies and config rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterTag {
    Person,
    Animal,
}

impl CharacterTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Animal => "animal",
        }
    }
}

impl fmt::Display for CharacterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "animal" => Ok(Self::Animal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersonTraits {
    pub profession: Profession,
    pub pregnant: bool,
    pub is_you: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalTraits {
    pub species: String,
    pub is_pet: bool,
}

impl Default for AnimalTraits {
    fn default() -> Self {
        Self {
            species: DEFAULT_SPECIES.to_string(),
            is_pet: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CharacterKind {
    Person(PersonTraits),
    Animal(AnimalTraits),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CharacterRecord")]
pub struct Character {
    age: u32,
    gender: Gender,
    body_type: BodyType,
    kind: CharacterKind,
}

/// Wire shape of a [`Character`]; decoding goes through [`Character::normalized`].
#[derive(Deserialize)]
struct CharacterRecord {
    age: u32,
    gender: Gender,
    body_type: BodyType,
    kind: CharacterKind,
}

impl From<CharacterRecord> for Character {
    fn from(record: CharacterRecord) -> Self {
        Self {
            age: record.age,
            gender: record.gender,
            body_type: record.body_type,
            kind: record.kind,
        }
        .normalized()
    }
}

impl Character {
    /// Build a person; profession and pregnancy are normalized against age and gender.
    #[must_use]
    pub fn person(
        age: u32,
        gender: Gender,
        body_type: BodyType,
        profession: Profession,
        pregnant: bool,
        is_you: bool,
    ) -> Self {
        Self {
            age,
            gender,
            body_type,
            kind: CharacterKind::Person(PersonTraits {
                profession,
                pregnant,
                is_you,
            }),
        }
        .normalized()
    }

    #[must_use]
    pub fn animal(
        age: u32,
        gender: Gender,
        body_type: BodyType,
        species: impl Into<String>,
        is_pet: bool,
    ) -> Self {
        Self {
            age,
            gender,
            body_type,
            kind: CharacterKind::Animal(AnimalTraits {
                species: species.into(),
                is_pet,
            }),
        }
    }

    /// Person with every field at its default: age 0, unknown gender, no profession.
    #[must_use]
    pub fn default_person() -> Self {
        Self::person(
            0,
            Gender::Unknown,
            BodyType::Unspecified,
            Profession::None,
            false,
            false,
        )
    }

    #[must_use]
    pub fn default_animal() -> Self {
        Self::animal(
            0,
            Gender::Unknown,
            BodyType::Unspecified,
            DEFAULT_SPECIES,
            false,
        )
    }

    fn normalized(mut self) -> Self {
        let adult = AgeCategory::from_age(self.age) == AgeCategory::Adult;
        let female = self.gender == Gender::Female;
        if let CharacterKind::Person(person) = &mut self.kind {
            if !adult {
                person.profession = Profession::None;
            }
            if !female {
                person.pregnant = false;
            }
        }
        self
    }

    /// Update the age; zero is ignored and the earlier value retained.
    #[must_use]
    pub fn with_age(mut self, age: u32) -> Self {
        if age > 0 {
            self.age = age;
        }
        self.normalized()
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self.normalized()
    }

    #[must_use]
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    /// No-op for animals.
    #[must_use]
    pub fn with_profession(mut self, profession: Profession) -> Self {
        if let CharacterKind::Person(person) = &mut self.kind {
            person.profession = profession;
        }
        self.normalized()
    }

    #[must_use]
    pub fn with_pregnant(mut self, pregnant: bool) -> Self {
        if let CharacterKind::Person(person) = &mut self.kind {
            person.pregnant = pregnant;
        }
        self.normalized()
    }

    #[must_use]
    pub fn with_you(mut self, is_you: bool) -> Self {
        if let CharacterKind::Person(person) = &mut self.kind {
            person.is_you = is_you;
        }
        self
    }

    #[must_use]
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        if let CharacterKind::Animal(animal) = &mut self.kind {
            animal.species = species.into();
        }
        self
    }

    #[must_use]
    pub fn with_pet(mut self, is_pet: bool) -> Self {
        if let CharacterKind::Animal(animal) = &mut self.kind {
            animal.is_pet = is_pet;
        }
        self
    }

    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    #[must_use]
    pub const fn body_type(&self) -> BodyType {
        self.body_type
    }

    #[must_use]
    pub const fn kind(&self) -> &CharacterKind {
        &self.kind
    }

    #[must_use]
    pub const fn tag(&self) -> CharacterTag {
        match self.kind {
            CharacterKind::Person(_) => CharacterTag::Person,
            CharacterKind::Animal(_) => CharacterTag::Animal,
        }
    }

    #[must_use]
    pub const fn age_category(&self) -> AgeCategory {
        AgeCategory::from_age(self.age)
    }

    #[must_use]
    pub const fn is_person(&self) -> bool {
        matches!(self.kind, CharacterKind::Person(_))
    }

    /// Profession of a person; `None` profession for animals.
    #[must_use]
    pub const fn profession(&self) -> Profession {
        match &self.kind {
            CharacterKind::Person(person) => person.profession,
            CharacterKind::Animal(_) => Profession::None,
        }
    }

    #[must_use]
    pub const fn is_pregnant(&self) -> bool {
        match &self.kind {
            CharacterKind::Person(person) => person.pregnant,
            CharacterKind::Animal(_) => false,
        }
    }

    #[must_use]
    pub const fn is_you(&self) -> bool {
        match &self.kind {
            CharacterKind::Person(person) => person.is_you,
            CharacterKind::Animal(_) => false,
        }
    }

    #[must_use]
    pub fn species(&self) -> Option<&str> {
        match &self.kind {
            CharacterKind::Person(_) => None,
            CharacterKind::Animal(animal) => Some(animal.species.as_str()),
        }
    }

    #[must_use]
    pub const fn is_pet(&self) -> bool {
        match &self.kind {
            CharacterKind::Person(_) => false,
            CharacterKind::Animal(animal) => animal.is_pet,
        }
    }

    /// Weight this character contributes to its group's survival score.
    #[must_use]
    pub const fn importance(&self) -> i32 {
        match &self.kind {
            CharacterKind::Person(person) => {
                let mut score = AgeCategory::from_age(self.age).importance();
                score += person.profession.importance();
                if person.pregnant {
                    score += PREGNANT_IMPORTANCE;
                }
                if person.is_you {
                    score += YOU_IMPORTANCE;
                }
                score
            }
            CharacterKind::Animal(animal) => {
                if animal.is_pet {
                    PET_IMPORTANCE
                } else {
                    0
                }
            }
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CharacterKind::Person(person) => {
                if person.is_you {
                    f.write_str("you ")?;
                }
                write!(f, "{} {} ", self.body_type, self.age_category())?;
                if person.profession != Profession::None {
                    write!(f, "{} ", person.profession)?;
                }
                write!(f, "{}", self.gender)?;
                if person.pregnant {
                    f.write_str(" pregnant")?;
                }
                Ok(())
            }
            CharacterKind::Animal(animal) => {
                f.write_str(&animal.species)?;
                if animal.is_pet {
                    f.write_str(" is pet")?;
                }
                Ok(())
            }
        }
    }
}
