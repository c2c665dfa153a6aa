pub mod clock;
pub mod quality;
pub mod review_record;
pub mod review_session;
pub mod sm2;

pub use clock::{Clock, FixedClock, SystemClock};
pub use quality::Quality;
pub use review_record::{CardMap, ReviewRecord};
pub use review_session::{ReviewSession, SessionSummary};
