pub trait GalleryConfig: Send + Sync {
    /// 分页查询未指定 size 时的默认每页数量
    fn page_size(&self) -> usize;
}
