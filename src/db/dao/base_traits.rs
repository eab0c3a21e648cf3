use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait HasIdColumn: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}
