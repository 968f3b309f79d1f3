pub mod accounts {

    pub const BOOTSTRAP_USERNAME: &str = "admin";

    pub const BOOTSTRAP_PASSWORD: &str = "admin123";

    pub const BOOTSTRAP_EMAIL: &str = "admin@demo.com";

    pub const MIN_PASSWORD_LENGTH: usize = 6;
}

pub mod forms {

    pub const MIN_NAME_LENGTH: usize = 2;

    pub const MIN_AGE: u32 = 0;

    pub const MAX_AGE: u32 = 120;

    pub const INTERESTS: &[&str] = &[
        "Programación",
        "Música",
        "Deportes",
        "Arte",
        "Ciencia",
        "Viajes",
        "Cocina",
        "Fotografía",
    ];

    pub const GENDERS: &[&str] = &["Masculino", "Femenino", "Otro", "Prefiero no decir"];
}

/// Format used by records written before timestamps moved to RFC 3339.
pub const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
