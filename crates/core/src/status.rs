//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID back to an enum variant.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( _ if id == $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Quote lifecycle status. Shared by formal quotes and custom quote
    /// requests (requests only ever use the Pending/Approved/Rejected/
    /// Cancelled subset).
    QuoteStatus {
        Pending = 1,
        Quoted = 2,
        Approved = 3,
        Accepted = 4,
        InProgress = 5,
        Completed = 6,
        Rejected = 7,
        Cancelled = 8,
    }
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Pending = 1,
        Planning = 2,
        InProgress = 3,
        Review = 4,
        Completed = 5,
        Cancelled = 6,
    }
}

define_status_enum! {
    /// Invoice billing status.
    InvoiceStatus {
        Pending = 1,
        Paid = 2,
        Overdue = 3,
        Cancelled = 4,
    }
}

impl QuoteStatus {
    /// Seed-data name of this status (as stored in `quote_statuses`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Quoted => "quoted",
            Self::Approved => "approved",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Cancelled)
    }

    /// Whether an admin-initiated transition from `self` to `next` is valid.
    ///
    /// The lifecycle runs `pending -> {quoted|approved|accepted|rejected} ->
    /// in_progress -> completed`, with `rejected` and `cancelled` as alternate
    /// terminal states reachable while the quote is still open.
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        match (self, next) {
            (Pending, Quoted | Approved | Accepted | Rejected | Cancelled) => true,
            (Quoted, Approved | Accepted | InProgress | Rejected | Cancelled) => true,
            (Approved, Accepted | InProgress | Cancelled) => true,
            (Accepted, InProgress | Cancelled) => true,
            (InProgress, Completed | Cancelled) => true,
            _ => false,
        }
    }
}
