//! Static city data: canonical list, alias table, latinized names.

/// Official province/municipality names, in lookup order.
pub const CANONICAL_CITIES: [&str; 63] = [
    "An Giang", "Bà Rịa - Vũng Tàu", "Bắc Giang", "Bắc Kạn", "Bạc Liêu", "Bắc Ninh",
    "Bến Tre", "Bình Định", "Bình Dương", "Bình Phước", "Bình Thuận", "Cà Mau",
    "Cần Thơ", "Cao Bằng", "Đà Nẵng", "Đắk Lắk", "Đắk Nông", "Điện Biên", "Đồng Nai",
    "Đồng Tháp", "Gia Lai", "Hà Giang", "Hà Nam", "Hà Nội", "Hà Tĩnh", "Hải Dương",
    "Hải Phòng", "Hậu Giang", "Hòa Bình", "Hưng Yên", "Khánh Hòa", "Kiên Giang",
    "Kon Tum", "Lai Châu", "Lâm Đồng", "Lạng Sơn", "Lào Cai", "Long An", "Nam Định",
    "Nghệ An", "Ninh Bình", "Ninh Thuận", "Phú Thọ", "Phú Yên", "Quảng Bình",
    "Quảng Nam", "Quảng Ngãi", "Quảng Ninh", "Quảng Trị", "Sóc Trăng", "Sơn La",
    "Tây Ninh", "Thái Bình", "Thái Nguyên", "Thanh Hóa", "Huế", "Tiền Giang",
    "TP Hồ Chí Minh", "Trà Vinh", "Tuyên Quang", "Vĩnh Long", "Vĩnh Phúc", "Yên Bái",
];

/// Colloquial names and abbreviations. Order is the tie-break: the first
/// alias found in the message wins, so longer phrases sit above the short
/// forms they contain.
///
/// Accented and unaccented spellings fold to the same key, so one entry
/// covers both. Bare "vinh" is deliberately absent: it is a substring of
/// Vĩnh Long, Vĩnh Phúc and Trà Vinh.
pub const CITY_ALIASES: &[(&str, &str)] = &[
    // TP.HCM
    ("thành phố hồ chí minh", "TP Hồ Chí Minh"),
    ("hồ chí minh", "TP Hồ Chí Minh"),
    ("sài gòn", "TP Hồ Chí Minh"),
    ("tphcm", "TP Hồ Chí Minh"),
    ("tp hcm", "TP Hồ Chí Minh"),
    ("hcm", "TP Hồ Chí Minh"),
    // Hà Nội
    ("hà nội", "Hà Nội"),
    ("hanoi", "Hà Nội"),
    ("hn", "Hà Nội"),
    // Huế
    ("thừa thiên huế", "Huế"),
    ("tt huế", "Huế"),
    ("huế", "Huế"),
    // Đà Nẵng
    ("đà nẵng", "Đà Nẵng"),
    ("danang", "Đà Nẵng"),
    ("dn", "Đà Nẵng"),
    // Bà Rịa - Vũng Tàu
    ("bà rịa vũng tàu", "Bà Rịa - Vũng Tàu"),
    ("vũng tàu", "Bà Rịa - Vũng Tàu"),
    ("bà rịa", "Bà Rịa - Vũng Tàu"),
    // Tourist cities mapped to their province
    ("đà lạt", "Lâm Đồng"),
    ("nha trang", "Khánh Hòa"),
    ("phú quốc", "Kiên Giang"),
    ("hạ long", "Quảng Ninh"),
    ("halong", "Quảng Ninh"),
    ("thành phố vinh", "Nghệ An"),
    ("tp vinh", "Nghệ An"),
    ("quy nhơn", "Bình Định"),
    ("buôn ma thuột", "Đắk Lắk"),
    ("pleiku", "Gia Lai"),
    ("sa pa", "Lào Cai"),
    ("sapa", "Lào Cai"),
    ("phan thiết", "Bình Thuận"),
    ("mũi né", "Bình Thuận"),
    ("biên hòa", "Đồng Nai"),
    ("thủ dầu một", "Bình Dương"),
    ("rạch giá", "Kiên Giang"),
    ("long xuyên", "An Giang"),
    ("châu đốc", "An Giang"),
    ("mỹ tho", "Tiền Giang"),
    ("tuy hòa", "Phú Yên"),
    ("đồng hới", "Quảng Bình"),
    ("hội an", "Quảng Nam"),
    ("tam kỳ", "Quảng Nam"),
];

/// Canonical name to the ASCII form accepted by the weather API.
///
/// Also carries the long provincial form "Thừa Thiên Huế" so callers holding
/// that name still get a latinized value.
pub const LATIN_NAMES: &[(&str, &str)] = &[
    ("An Giang", "An Giang"),
    ("Bà Rịa - Vũng Tàu", "Ba Ria - Vung Tau"),
    ("Bắc Giang", "Bac Giang"),
    ("Bắc Kạn", "Bac Kan"),
    ("Bạc Liêu", "Bac Lieu"),
    ("Bắc Ninh", "Bac Ninh"),
    ("Bến Tre", "Ben Tre"),
    ("Bình Định", "Binh Dinh"),
    ("Bình Dương", "Binh Duong"),
    ("Bình Phước", "Binh Phuoc"),
    ("Bình Thuận", "Binh Thuan"),
    ("Cà Mau", "Ca Mau"),
    ("Cần Thơ", "Can Tho"),
    ("Cao Bằng", "Cao Bang"),
    ("Đà Nẵng", "Da Nang"),
    ("Đắk Lắk", "Dak Lak"),
    ("Đắk Nông", "Dak Nong"),
    ("Điện Biên", "Dien Bien"),
    ("Đồng Nai", "Dong Nai"),
    ("Đồng Tháp", "Dong Thap"),
    ("Gia Lai", "Gia Lai"),
    ("Hà Giang", "Ha Giang"),
    ("Hà Nam", "Ha Nam"),
    ("Hà Nội", "Hanoi"),
    ("Hà Tĩnh", "Ha Tinh"),
    ("Hải Dương", "Hai Duong"),
    ("Hải Phòng", "Hai Phong"),
    ("Hậu Giang", "Hau Giang"),
    ("Hòa Bình", "Hoa Binh"),
    ("Hưng Yên", "Hung Yen"),
    ("Khánh Hòa", "Khanh Hoa"),
    ("Kiên Giang", "Kien Giang"),
    ("Kon Tum", "Kon Tum"),
    ("Lai Châu", "Lai Chau"),
    ("Lâm Đồng", "Lam Dong"),
    ("Lạng Sơn", "Lang Son"),
    ("Lào Cai", "Lao Cai"),
    ("Long An", "Long An"),
    ("Nam Định", "Nam Dinh"),
    ("Nghệ An", "Nghe An"),
    ("Ninh Bình", "Ninh Binh"),
    ("Ninh Thuận", "Ninh Thuan"),
    ("Phú Thọ", "Phu Tho"),
    ("Phú Yên", "Phu Yen"),
    ("Quảng Bình", "Quang Binh"),
    ("Quảng Nam", "Quang Nam"),
    ("Quảng Ngãi", "Quang Ngai"),
    ("Quảng Ninh", "Quang Ninh"),
    ("Quảng Trị", "Quang Tri"),
    ("Sóc Trăng", "Soc Trang"),
    ("Sơn La", "Son La"),
    ("Tây Ninh", "Tay Ninh"),
    ("Thái Bình", "Thai Binh"),
    ("Thái Nguyên", "Thai Nguyen"),
    ("Thanh Hóa", "Thanh Hoa"),
    ("Huế", "Hue"),
    ("Thừa Thiên Huế", "Hue"),
    ("Tiền Giang", "Tien Giang"),
    ("TP Hồ Chí Minh", "Ho Chi Minh"),
    ("Trà Vinh", "Tra Vinh"),
    ("Tuyên Quang", "Tuyen Quang"),
    ("Vĩnh Long", "Vinh Long"),
    ("Vĩnh Phúc", "Vinh Phuc"),
    ("Yên Bái", "Yen Bai"),
];
