// Worked example: a user record table exposed to the domain through `UserGateway`.

pub mod domain;
pub mod factory;
pub mod gateway;

pub use domain::User;
pub use factory::GatewayFactory;
pub use gateway::{user_gateway_port, RecordTableUserGateway, UserGateway};
