//! Shared reflected record fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use dynquery::reflect::{FieldType, Reflect, Shape, Typed, Value};
use dynquery::{reflect_enum, reflect_record};
use uuid::Uuid;

// =============================================================================
// Fixture Types
// =============================================================================

#[derive(Debug)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

reflect_record! {
    Location {
        "Latitude" => latitude: f64,
        "Longitude" => longitude: f64,
    }
}

#[derive(Debug)]
pub struct Address {
    pub city: String,
    pub location: Option<Location>,
}

reflect_record! {
    Address {
        "City" => city: String,
        "Location" => location: Option<Location>,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Draft = 0,
    Published = 1,
    Archived = 2,
}

reflect_enum!(Status { Draft, Published, Archived });

#[derive(Debug)]
pub struct Tag {
    pub name: String,
    pub weight: i32,
}

reflect_record! {
    Tag {
        "Name" => name: String,
        "Weight" => weight: i32,
    }
}

/// Record with a string-keyed indexer (`Settings.theme` or
/// `Settings.Item.theme`)
#[derive(Debug)]
pub struct Settings {
    pub values: HashMap<String, String>,
}

impl Reflect for Settings {
    fn shape() -> Shape {
        Shape::new("Settings")
            .member("Count", FieldType::Long)
            .with_indexer(FieldType::String)
    }

    fn member(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "Count" => Some(Value::Int(self.values.len() as i64)),
            _ => None,
        }
    }

    fn index(&self, key: &str) -> Option<Value<'_>> {
        self.values.get(key).map(Typed::to_value)
    }
}

impl Typed for Settings {
    fn field_type() -> FieldType {
        FieldType::Object(<Settings as Reflect>::shape)
    }

    fn to_value(&self) -> Value<'_> {
        Value::Object(self)
    }
}

#[derive(Debug)]
pub struct Document {
    pub id: Uuid,
    pub content_type_id: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub views: i64,
    pub rating: Option<f64>,
    pub published: bool,
    pub created: NaiveDateTime,
    pub due: Option<NaiveDate>,
    pub status: Status,
    pub tags: Vec<String>,
    pub scores: Vec<i32>,
    pub related: Vec<Tag>,
    pub dict: HashMap<String, String>,
    pub counts: HashMap<i64, i32>,
    pub address: Option<Address>,
    pub settings: Settings,
    pub meta: serde_json::Value,
}

reflect_record! {
    Document {
        "Id" => id: Uuid,
        "ContentTypeId" => content_type_id: i32,
        "Title" => title: String,
        "Subtitle" => subtitle: Option<String>,
        "Views" => views: i64,
        "Rating" => rating: Option<f64>,
        "Published" => published: bool,
        "Created" => created: NaiveDateTime,
        "Due" => due: Option<NaiveDate>,
        "Status" => status: Status,
        "Tags" => tags: Vec<String>,
        "Scores" => scores: Vec<i32>,
        "Related" => related: Vec<Tag>,
        "Dict" => dict: HashMap<String, String>,
        "Counts" => counts: HashMap<i64, i32>,
        "Address" => address: Option<Address>,
        "Settings" => settings: Settings,
        "Meta" => meta: serde_json::Value,
    }
}

// =============================================================================
// Builders
// =============================================================================

pub fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// A document with neutral defaults and the given content type
pub fn document(content_type_id: i32) -> Document {
    Document {
        id: Uuid::new_v4(),
        content_type_id,
        title: String::new(),
        subtitle: None,
        views: 0,
        rating: None,
        published: false,
        created: timestamp(2021, 1, 1, 0, 0),
        due: None,
        status: Status::Draft,
        tags: Vec::new(),
        scores: Vec::new(),
        related: Vec::new(),
        dict: HashMap::new(),
        counts: HashMap::new(),
        address: None,
        settings: Settings {
            values: HashMap::new(),
        },
        meta: serde_json::Value::Null,
    }
}

pub fn address(city: &str, latitude: f64) -> Address {
    Address {
        city: city.to_string(),
        location: Some(Location {
            latitude,
            longitude: 0.0,
        }),
    }
}

pub fn tag(name: &str, weight: i32) -> Tag {
    Tag {
        name: name.to_string(),
        weight,
    }
}

/// A varied set of documents covering nulls, collections and nesting
pub fn sample_documents() -> Vec<Document> {
    let mut first = document(1);
    first.title = "Getting Started".into();
    first.subtitle = Some("Intro".into());
    first.views = 120;
    first.rating = Some(4.5);
    first.published = true;
    first.created = timestamp(2021, 6, 15, 9, 30);
    first.due = NaiveDate::from_ymd_opt(2021, 7, 1);
    first.status = Status::Published;
    first.tags = vec!["rust".into(), "guide".into()];
    first.scores = vec![3, 7];
    first.related = vec![tag("setup", 2), tag("install", 5)];
    first.dict = HashMap::from([("lang".to_string(), "en".to_string())]);
    first.counts = HashMap::from([(1, 10)]);
    first.address = Some(address("Lisbon", 38.7));
    first.meta = serde_json::json!({"source": "import", "priority": 2, "labels": ["a", "b"]});

    let mut second = document(1);
    second.title = "Advanced Topics".into();
    second.views = 45;
    second.rating = Some(3.0);
    second.created = timestamp(2022, 2, 1, 18, 0);
    second.status = Status::Archived;
    second.tags = vec!["advanced".into()];
    second.scores = vec![9];
    second.related = vec![tag("macros", 8)];
    second.dict = HashMap::from([
        ("lang".to_string(), "pt".to_string()),
        ("level".to_string(), "hard".to_string()),
    ]);
    second.address = Some(Address {
        city: "Porto".into(),
        location: None,
    });
    second.meta = serde_json::json!({"source": "manual", "priority": "high"});

    let mut third = document(2);
    third.title = "getting help".into();
    third.views = 7;
    third.created = timestamp(2020, 12, 31, 23, 59);
    third.tags = Vec::new();
    third.dict = HashMap::from([("lang".to_string(), "EN".to_string())]);

    let mut fourth = document(3);
    fourth.title = "Release Notes".into();
    fourth.subtitle = Some(String::new());
    fourth.views = 300;
    fourth.rating = Some(5.0);
    fourth.published = true;
    fourth.created = timestamp(2023, 3, 3, 12, 0);
    fourth.status = Status::Published;
    fourth.tags = vec!["news".into(), "rust".into()];
    fourth.scores = vec![1, 2, 3];
    fourth.dict = HashMap::from([("lang".to_string(), "de".to_string())]);
    fourth.address = Some(address("Berlin", 52.5));

    vec![first, second, third, fourth]
}
