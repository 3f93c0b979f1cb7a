mod sorted_list;

pub(crate) use sorted_list::{RawCursor, RawSortedList};
