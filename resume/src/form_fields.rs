/// Create an enum of focusable fields that can be cycled with tab/shift-tab.
/// Fields that are currently unavailable can be skipped over.
#[macro_export]
macro_rules! form_fields {
    ($name:ident, $($variant:ident),*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            const FIELDS: &'static [$name] = &[
                $($name::$variant),*
            ];

            fn index(self) -> usize {
                match self {
                    $(Self::$variant => $name::$variant as usize),*
                }
            }

            /// Rotate forward (e.g. with tab) to the next field `available`
            /// accepts. Stays put if no other field is available.
            fn next_where(self, available: impl Fn(Self) -> bool) -> Self {
                let len = Self::FIELDS.len();

                (1..len)
                    .map(|step| Self::FIELDS[(self.index() + step) % len])
                    .find(|field| available(*field))
                    .unwrap_or(self)
            }

            /// Rotate backward (e.g. with shift-tab) to the previous field
            /// `available` accepts. Stays put if no other field is available.
            fn prev_where(self, available: impl Fn(Self) -> bool) -> Self {
                let len = Self::FIELDS.len();

                (1..len)
                    .map(|step| Self::FIELDS[(self.index() + len - step) % len])
                    .find(|field| available(*field))
                    .unwrap_or(self)
            }
        }
    };
}
