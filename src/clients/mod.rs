pub mod dragonball;

pub use dragonball::{ClientError, DragonBallApi, DragonBallClient, Paginated};
