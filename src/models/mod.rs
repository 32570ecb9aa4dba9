pub mod answer;
pub mod badge;
pub mod member;
pub mod question;
pub mod roast;
pub mod roster;
pub mod wall;
pub mod wishlist;
