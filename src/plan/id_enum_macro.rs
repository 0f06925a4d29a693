/// Defines a string-tagged identifier enum with a `Custom(String)` catch-all.
///
/// Known variants serialize to their tag. Any other tag round-trips through
/// `Custom`, which lets a hand-written plan file name an ecosystem the built-in
/// providers do not know about.
#[macro_export]
macro_rules! define_id_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $tag:literal $( | $alias:literal )*
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            Custom(String),
        }

        impl $enum_name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(
                        Self::$variant => $tag,
                    )*
                    Self::Custom(tag) => tag,
                }
            }

            /// Parses a tag, accepting aliases. Unknown tags become `Custom`.
            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $(
                        $tag $(| $alias)* => Self::$variant,
                    )*
                    other => Self::Custom(other.to_string()),
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let tag = String::deserialize(deserializer)?;
                Ok(Self::from_tag(&tag))
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
