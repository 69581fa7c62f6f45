use crate::model::id::ResidentId;

pub struct CreateToken {
    pub resident_id: ResidentId,
    pub access_token: String,
}

impl CreateToken {
    pub fn new(resident_id: ResidentId) -> Self {
        let access_token = uuid::Uuid::new_v4().simple().to_string();
        Self {
            resident_id,
            access_token,
        }
    }
}
