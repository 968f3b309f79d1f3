pub use super::perfiles::Entity as Perfiles;
pub use super::usuarios::Entity as Usuarios;
