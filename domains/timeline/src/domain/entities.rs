//! Domain entities for the Timeline domain
//!
//! Eras, chemists, historical events and user feedback. Constructors and
//! `validate()` enforce the same rules the database CHECK constraints do, so a
//! bad payload is rejected before it reaches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chronochem_common::{Error, Result};

/// Maximum era / chemist name length (varchar(100))
const MAX_NAME_LENGTH: usize = 100;

/// Maximum event title length (varchar(200))
const MAX_TITLE_LENGTH: usize = 200;

/// Maximum asset path / URL length (varchar(200))
const MAX_PATH_LENGTH: usize = 200;

/// Maximum feedback comment length (CHECK length <= 2000)
const MAX_COMMENT_LENGTH: usize = 2000;

/// Accepted feedback rating range
const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

fn validate_name(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn validate_path(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > MAX_PATH_LENGTH => Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_PATH_LENGTH
        ))),
        _ => Ok(()),
    }
}

/// Historical era
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Era {
    pub id: Uuid,
    pub name: String,
    /// Representative year; BCE years are negative
    pub year: i32,
    pub description: String,
    pub model_url: Option<String>,
    pub soundtrack_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Era {
    pub fn new(
        name: String,
        year: i32,
        description: String,
        model_url: Option<String>,
        soundtrack_url: Option<String>,
    ) -> Result<Self> {
        let now = Utc::now();
        let era = Era {
            id: Uuid::new_v4(),
            name,
            year,
            description,
            model_url,
            soundtrack_url,
            created_at: now,
            updated_at: now,
        };
        era.validate()?;
        Ok(era)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("Name", &self.name, MAX_NAME_LENGTH)?;
        validate_path("Model URL", self.model_url.as_deref())?;
        validate_path("Soundtrack URL", self.soundtrack_url.as_deref())?;
        Ok(())
    }
}

/// Placement of a chemist's model in the 3D scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Input for [`Chemist::new`]
#[derive(Debug, Clone, Default)]
pub struct NewChemist {
    pub era_id: Uuid,
    pub name: String,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    pub description: String,
    pub bio: Option<String>,
    pub position: Option<Position>,
    pub portrait_path: Option<String>,
    pub model_path: Option<String>,
}

/// Historical chemist; the persona a chat session role-plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chemist {
    pub id: Uuid,
    pub era_id: Uuid,
    pub name: String,
    pub birth_year: i32,
    pub death_year: Option<i32>,
    /// Achievement summary embedded in the persona prompt
    pub description: String,
    pub bio: Option<String>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
    pub portrait_path: Option<String>,
    pub model_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chemist {
    pub fn new(input: NewChemist) -> Result<Self> {
        let now = Utc::now();
        let mut chemist = Chemist {
            id: Uuid::new_v4(),
            era_id: input.era_id,
            name: input.name,
            birth_year: input.birth_year,
            death_year: input.death_year,
            description: input.description,
            bio: input.bio,
            position_x: None,
            position_y: None,
            position_z: None,
            portrait_path: input.portrait_path,
            model_path: input.model_path,
            created_at: now,
            updated_at: now,
        };
        chemist.set_position(input.position);
        chemist.validate()?;
        Ok(chemist)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("Name", &self.name, MAX_NAME_LENGTH)?;

        if let Some(death) = self.death_year {
            if death < self.birth_year {
                return Err(Error::Validation(format!(
                    "death_year ({}) must not precede birth_year ({})",
                    death, self.birth_year
                )));
            }
        }

        validate_path("Portrait path", self.portrait_path.as_deref())?;
        validate_path("Model path", self.model_path.as_deref())?;
        Ok(())
    }

    /// Scene position, present only when all three coordinates are stored
    pub fn position(&self) -> Option<Position> {
        match (self.position_x, self.position_y, self.position_z) {
            (Some(x), Some(y), Some(z)) => Some(Position { x, y, z }),
            _ => None,
        }
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position_x = position.map(|p| p.x);
        self.position_y = position.map(|p| p.y);
        self.position_z = position.map(|p| p.z);
    }
}

/// Kind of historical event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[default]
    Discovery,
    Invention,
    Publication,
    Award,
    Other,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Discovery => write!(f, "discovery"),
            EventCategory::Invention => write!(f, "invention"),
            EventCategory::Publication => write!(f, "publication"),
            EventCategory::Award => write!(f, "award"),
            EventCategory::Other => write!(f, "other"),
        }
    }
}

/// Input for [`HistoricalEvent::new`]
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub year: i32,
    pub category: EventCategory,
    pub chemist_id: Option<Uuid>,
    pub era_id: Option<Uuid>,
    pub image_path: Option<String>,
}

/// Dated historical event, owned by a chemist, an era, or both.
///
/// The year is deliberately not checked against the owning chemist's
/// lifespan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoricalEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub year: i32,
    pub category: EventCategory,
    pub chemist_id: Option<Uuid>,
    pub era_id: Option<Uuid>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HistoricalEvent {
    pub fn new(input: NewEvent) -> Result<Self> {
        let now = Utc::now();
        let event = HistoricalEvent {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            year: input.year,
            category: input.category,
            chemist_id: input.chemist_id,
            era_id: input.era_id,
            image_path: input.image_path,
            created_at: now,
            updated_at: now,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("Title", &self.title, MAX_TITLE_LENGTH)?;

        if self.chemist_id.is_none() && self.era_id.is_none() {
            return Err(Error::Validation(
                "Event must belong to a chemist or an era".to_string(),
            ));
        }

        validate_path("Image path", self.image_path.as_deref())?;
        Ok(())
    }

    pub fn is_discovery(&self) -> bool {
        self.category == EventCategory::Discovery
    }
}

/// Rating and comment left by a visitor on a chemist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserFeedback {
    pub id: Uuid,
    pub chemist_id: Uuid,
    pub user_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl UserFeedback {
    pub fn new(
        chemist_id: Uuid,
        user_id: Option<Uuid>,
        rating: i32,
        comment: String,
    ) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(Error::Validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(Error::Validation(format!(
                "Comment must be at most {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        Ok(UserFeedback {
            id: Uuid::new_v4(),
            chemist_id,
            user_id,
            rating,
            comment,
            created_at: Utc::now(),
        })
    }
}
