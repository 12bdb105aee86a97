// =============================================================================
// FIXTURES — Modèles partagés par les tests unitaires
// =============================================================================
//
// Un petit modèle "entités ↔ DTO" :
//
//   Person  { id, name, age: Option<i32>, address: Option<Address>, tags }
//   PersonDto { id, name, age: i32, address: Option<AddressDto>, tags, nickname }
//
//   Address { city, zip: u32 }          AddressDto { city, zip: Option<u32> }
//
//   Order { number, lines: Vec<Option<Line>> }
//   OrderDto { number, lines: Vec<Option<LineDto>> }
//
//   Basket { items: Vec<Line> }          BasketDto { items: Vec<LineDto> }
//
// =============================================================================

use crate::mappable;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: u32,
}

impl Address {
    pub fn at(city: &str) -> Self {
        Address {
            city: city.to_string(),
            zip: 0,
        }
    }
}

mappable!(Address {
    city: value String,
    zip: value u32,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressDto {
    pub city: String,
    pub zip: Option<u32>,
}

mappable!(AddressDto {
    city: value String,
    zip: nullable u32,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub age: Option<i32>,
    pub address: Option<Address>,
    pub tags: Vec<String>,
}

impl Person {
    pub fn named(name: &str) -> Self {
        Person {
            name: name.to_string(),
            ..Person::default()
        }
    }
}

mappable!(Person {
    #[readonly]
    id: value u64,
    name: value String,
    age: nullable i32,
    address: object Address,
    tags: value Vec<String>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonDto {
    pub id: u64,
    pub name: String,
    pub age: i32,
    pub address: Option<AddressDto>,
    pub tags: Vec<String>,
    pub nickname: String,
}

mappable!(PersonDto {
    id: value u64,
    name: value String,
    age: value i32,
    address: object AddressDto,
    tags: value Vec<String>,
    nickname: value String,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub sku: String,
    pub quantity: u32,
}

impl Line {
    pub fn new(sku: &str, quantity: u32) -> Self {
        Line {
            sku: sku.to_string(),
            quantity,
        }
    }
}

mappable!(Line {
    sku: value String,
    quantity: value u32,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDto {
    pub sku: String,
    pub quantity: Option<u32>,
}

mappable!(LineDto {
    sku: value String,
    quantity: nullable u32,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub number: String,
    pub lines: Vec<Option<Line>>,
}

mappable!(Order {
    number: value String,
    lines: embedded Vec<Option<Line>>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDto {
    pub number: String,
    pub lines: Vec<Option<LineDto>>,
}

mappable!(OrderDto {
    number: value String,
    lines: embedded Vec<Option<LineDto>>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basket {
    pub items: Vec<Line>,
}

mappable!(Basket {
    items: embedded Vec<Line>,
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasketDto {
    pub items: Vec<LineDto>,
}

mappable!(BasketDto {
    items: embedded Vec<LineDto>,
});

/// Même membre `age`, mais en texte : aucune règle de pont avec `i32`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonText {
    pub name: String,
    pub age: String,
}

mappable!(PersonText {
    name: value String,
    age: value String,
});
