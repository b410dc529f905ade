pub mod cards;
pub mod houses;

pub use cards::Entity as Cards;
pub use cards::Model as CardRow;
pub use houses::Entity as Houses;
pub use houses::Model as House;
