pub mod prelude;

pub mod perfiles;
pub mod usuarios;
