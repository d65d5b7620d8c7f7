use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use ptbook_core::collaborators::{MemberDirectory, WorkoutRecordStore};
use ptbook_core::errors::ScheduleResult;

// Mock collaborators for testing
mock! {
    pub MemberDirectory {}

    #[async_trait]
    impl MemberDirectory for MemberDirectory {
        async fn resolve_display_name(&self, member_id: Uuid) -> ScheduleResult<String>;
        async fn is_active_pair(&self, trainer_id: Uuid, member_id: Uuid) -> ScheduleResult<bool>;
    }
}

mock! {
    pub WorkoutRecordStore {}

    #[async_trait]
    impl WorkoutRecordStore for WorkoutRecordStore {
        async fn list_record_dates(
            &self,
            owner_id: Uuid,
            year: i32,
            month: u32,
        ) -> ScheduleResult<Vec<NaiveDate>>;
    }
}
