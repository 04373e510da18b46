//! User-facing message strings and fixed limits.
//!
//! Messages are in Vietnamese because they are shown verbatim to the site's
//! administrators.

/// Shown when the backend cannot be reached at all.
pub const CONNECTION_GUIDANCE: &str = "Không thể kết nối đến server. Vui lòng kiểm tra kết nối mạng và đảm bảo backend đang chạy.";

/// Shown when a response body is not valid JSON or does not have the expected shape.
pub const INVALID_RESPONSE: &str = "Phản hồi từ server không hợp lệ";

/// Fallback when nothing more specific is known.
pub const UNKNOWN_ERROR: &str = "Có lỗi không xác định xảy ra";

pub const INVALID_VIDEO_FILE: &str = "Vui lòng chọn file video hợp lệ";
pub const INVALID_IMAGE_FILE: &str = "Chỉ được upload file hình ảnh";
pub const IMAGE_TOO_LARGE: &str = "Kích thước file không được vượt quá 10MB";

pub const UPLOADING: &str = "📤 Đang upload video lên server...";
pub const PROCESSING: &str = "⚙️ Đang xử lý video (chuyển đổi sang HLS)...";
pub const READY: &str = "✅ Video đã sẵn sàng! Bây giờ bạn có thể tạo phim.";
pub const STATUS_CHECK_FAILED: &str = "Lỗi kiểm tra trạng thái video";
pub const PROCESSING_TIMED_OUT: &str = "Quá thời gian chờ xử lý video";
/// The upload call was abandoned before the backend answered.
pub const UPLOAD_ABANDONED: &str = "Upload đã bị huỷ trước khi server phản hồi";

/// Prefix for upload transport failures.
pub const UPLOAD_ERROR_PREFIX: &str = "Lỗi upload";
/// Prefix for backend-reported transcoding failures.
pub const PROCESSING_ERROR_PREFIX: &str = "Lỗi xử lý video";

/// Maximum poster/banner size accepted by the backend.
pub const MAX_IMAGE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Progress shown once the upload POST has been accepted.
pub const PROGRESS_AFTER_UPLOAD: u8 = 50;
/// Progress added per `PROCESSING` poll.
pub const PROGRESS_STEP: u8 = 5;
/// Progress never exceeds this until the backend reports `READY`.
pub const PROGRESS_CAP: u8 = 90;
