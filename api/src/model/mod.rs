pub mod auth;
pub mod dashboard;
pub mod notification;
pub mod parking;
pub mod project;
pub mod resident;
pub mod vehicle;

// ドメインの列挙型と、JSON でやり取りするための列挙型を相互に変換できるようにする
macro_rules! define_name_enum {
    ($name: ident, $kernel: ident, [$($variant: ident),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl From<$kernel> for $name {
            fn from(value: $kernel) -> Self {
                match value {
                    $($kernel::$variant => Self::$variant),+
                }
            }
        }

        impl From<$name> for $kernel {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => Self::$variant),+
                }
            }
        }
    };
}

pub(crate) use define_name_enum;
