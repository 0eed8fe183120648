use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BookingCreate {
    pub hotel_id: Uuid,
    pub check_in: String,
    pub check_out: String,
    pub guests: i32,
}
